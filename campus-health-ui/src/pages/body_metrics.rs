//! Body Metrics Page

use std::rc::Rc;

use campus_health::common::dates::today;
use campus_health::pages::body_metrics::{ids, BodyMetricsPage, CHART_RANGES};
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form, row_action};

const FORM_FIELDS: [&str; 4] = [ids::EDITING_ID, ids::WEIGHT, ids::HEIGHT, ids::RECORD_DATE];

#[component]
pub fn BodyMetrics() -> impl IntoView {
    let page = Rc::new(BodyMetricsPage::new(page_context(), today()));
    let range = create_rw_signal(page.range_days());

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile().await;
    });

    let on_measure = {
        let page = Rc::clone(&page);
        move |_: ev::Event| {
            page.preview(&read_form(&FORM_FIELDS));
        }
    };

    let open_create = {
        let page = Rc::clone(&page);
        move |_: ev::MouseEvent| page.open_create()
    };

    let on_row = {
        let page = Rc::clone(&page);
        move |ev: ev::MouseEvent| {
            if let Some(action) = row_action(&ev) {
                let page = Rc::clone(&page);
                spawn_local(async move {
                    let _ = page.handle(action).await;
                });
            }
        }
    };

    let range_buttons = {
        let page = Rc::clone(&page);
        CHART_RANGES
            .into_iter()
            .map(|days| {
                let page = Rc::clone(&page);
                view! {
                    <button
                        type="button"
                        class="btn btn-sm btn-outline-primary"
                        class:active=move || range.get() == days
                        on:click=move |_| {
                            page.set_range(days);
                            range.set(page.range_days());
                        }
                    >
                        {format!("{}天", days)}
                    </button>
                }
            })
            .collect_view()
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&FORM_FIELDS);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.submit(&form).await;
        });
    };

    view! {
        <div class="d-flex justify-content-between align-items-center mb-4">
            <h2>"身体指标"</h2>
            <button type="button" class="btn btn-primary" on:click=open_create>"新增记录"</button>
        </div>
        <div id={ids::CURRENT} class="mb-4"></div>
        <div class="card mb-4">
            <div class="card-header d-flex justify-content-between align-items-center">
                <span>"体重趋势"</span>
                <div class="btn-group">{range_buttons}</div>
            </div>
            <div class="card-body">
                <canvas id={ids::CHART} style="max-height: 320px;"></canvas>
            </div>
        </div>
        <div class="card">
            <div class="card-header">"历史记录"</div>
            <table class="table table-hover mb-0">
                <thead>
                    <tr><th>"日期"</th><th>"体重 (kg)"</th><th>"身高 (cm)"</th><th>"BMI"</th><th>"状态"</th><th></th></tr>
                </thead>
                <tbody id={ids::HISTORY} on:click=on_row></tbody>
            </table>
        </div>

        <div class="modal fade" id={ids::MODAL} tabindex="-1" aria-hidden="true">
            <div class="modal-dialog">
                <form class="modal-content" on:submit=on_submit>
                    <div class="modal-header">
                        <h5 class="modal-title">"身体指标"</h5>
                        <button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button>
                    </div>
                    <div class="modal-body">
                        <input type="hidden" id={ids::EDITING_ID} />
                        <label class="form-label" for={ids::WEIGHT}>"体重 (kg)"</label>
                        <input type="number" step="0.1" min="0" class="form-control mb-3" id={ids::WEIGHT} on:input=on_measure.clone() />
                        <label class="form-label" for={ids::HEIGHT}>"身高 (cm)"</label>
                        <input type="number" step="0.1" min="0" class="form-control mb-3" id={ids::HEIGHT} on:input=on_measure />
                        <label class="form-label" for={ids::RECORD_DATE}>"记录日期"</label>
                        <input type="date" class="form-control mb-3" id={ids::RECORD_DATE} />
                        <div id={ids::PREVIEW}></div>
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">"取消"</button>
                        <button type="submit" class="btn btn-primary">"保存"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
