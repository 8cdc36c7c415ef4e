//! Sleep Page

use std::rc::Rc;

use campus_health::common::dates::{format_date, parse_date, today};
use campus_health::pages::sleep::{ids, SleepPage};
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form};

#[component]
pub fn Sleep() -> impl IntoView {
    let page = Rc::new(SleepPage::new(page_context(), today()));

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

    let open = {
        let page = Rc::clone(&page);
        move |_: ev::MouseEvent| {
            let page = Rc::clone(&page);
            spawn_local(async move {
                let _ = page.open_modal().await;
            });
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::SLEEP_TIME, ids::WAKEUP_TIME]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.submit(&form).await;
        });
    };

    view! {
        <div class="d-flex justify-content-between align-items-center mb-4">
            <h2>"睡眠记录"</h2>
            <div class="d-flex gap-2">
                <input type="date" class="form-control" value={format_date(today())} on:change=on_date />
                <button type="button" class="btn btn-primary text-nowrap" on:click=open>"记录睡眠"</button>
            </div>
        </div>
        <div id={ids::SUMMARY}></div>

        <div class="modal fade" id={ids::MODAL} tabindex="-1" aria-labelledby={ids::MODAL_TITLE} aria-hidden="true">
            <div class="modal-dialog">
                <form class="modal-content" on:submit=on_submit>
                    <div class="modal-header">
                        <h5 class="modal-title" id={ids::MODAL_TITLE}>"记录睡眠"</h5>
                        <button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button>
                    </div>
                    <div class="modal-body">
                        <label class="form-label" for={ids::SLEEP_TIME}>"入睡时间"</label>
                        <input type="datetime-local" class="form-control mb-3" id={ids::SLEEP_TIME} />
                        <label class="form-label" for={ids::WAKEUP_TIME}>"起床时间"</label>
                        <input type="datetime-local" class="form-control" id={ids::WAKEUP_TIME} />
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">"取消"</button>
                        <button type="submit" class="btn btn-primary" id={ids::SUBMIT}>"保存记录"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
