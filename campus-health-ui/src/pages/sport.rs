//! Sport Page

use std::rc::Rc;

use campus_health::common::dates::{format_date, parse_date, today};
use campus_health::pages::sport::{ids, SportPage};
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form, row_action};

#[component]
pub fn Sport() -> impl IntoView {
    let page = Rc::new(SportPage::new(page_context(), today()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile(today()).await;
    });

    let on_date = {
        let page = Rc::clone(&page);
        move |ev: ev::Event| {
            if let Some(date) = parse_date(&event_target_value(&ev)) {
                let page = Rc::clone(&page);
                spawn_local(async move {
                    page.reconcile(date).await;
                });
            }
        }
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

    let cancel = {
        let page = Rc::clone(&page);
        move |_: ev::MouseEvent| page.reset_form()
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::SPORT_TYPE, ids::DURATION, ids::CALORIES]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.submit(&form).await;
        });
    };

    view! {
        <div class="d-flex justify-content-between align-items-center mb-4">
            <h2>"运动记录"</h2>
            <input type="date" class="form-control w-auto" value={format_date(today())} on:change=on_date />
        </div>
        <div class="row g-4">
            <div class="col-lg-5">
                <form class="card card-body" on:submit=on_submit>
                    <label class="form-label" for={ids::SPORT_TYPE}>"运动类型"</label>
                    <input type="text" class="form-control mb-3" id={ids::SPORT_TYPE} placeholder="如：跑步" />
                    <label class="form-label" for={ids::DURATION}>"时长（分钟）"</label>
                    <input type="number" min="1" class="form-control mb-3" id={ids::DURATION} />
                    <label class="form-label" for={ids::CALORIES}>"消耗热量（大卡）"</label>
                    <input type="number" min="0" step="0.1" class="form-control mb-3" id={ids::CALORIES} />
                    <div class="d-flex gap-2">
                        <button type="submit" class="btn btn-primary" id={ids::SUBMIT}>"添加记录"</button>
                        <button type="button" class="btn btn-outline-secondary" on:click=cancel>"取消"</button>
                    </div>
                </form>
            </div>
            <div class="col-lg-7">
                <div class="card">
                    <div class="card-header d-flex justify-content-between">
                        <span>"今日运动"</span>
                        <span>"总消耗: " <strong id={ids::TOTAL}>"0"</strong> " 大卡"</span>
                    </div>
                    <ul class="list-group list-group-flush" id={ids::LIST} on:click=on_row></ul>
                </div>
            </div>
        </div>
    }
}
