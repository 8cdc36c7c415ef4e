//! Friends Page

use std::rc::Rc;

use campus_health::pages::friends::{ids, FriendsPage};
use campus_health::FormValues;
use leptos::*;

use super::page_context;
use crate::browser::field_value;
use crate::dom::{after_mount, read_form, row_action, submitted_form, switch_change};

/// Fields of a per-entry comment form, read from its data attributes
fn comment_fields(form: &web_sys::HtmlFormElement) -> FormValues {
    let text = form
        .query_selector("input[name=\"text\"]")
        .ok()
        .flatten()
        .map(|input| field_value(&input))
        .unwrap_or_default();
    FormValues::new()
        .with(ids::COMMENT_TYPE, &form.get_attribute("data-content-type").unwrap_or_default())
        .with(ids::COMMENT_OBJECT, &form.get_attribute("data-object-id").unwrap_or_default())
        .with(ids::COMMENT_TEXT, &text)
}

#[component]
pub fn Friends() -> impl IntoView {
    let page = Rc::new(FriendsPage::new(page_context()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile().await;
    });

    let on_search = {
        let page = Rc::clone(&page);
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let form = read_form(&[ids::SEARCH]);
            let page = Rc::clone(&page);
            spawn_local(async move {
                let _ = page.send_request(&form).await;
            });
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

    let on_switch = {
        let page = Rc::clone(&page);
        move |ev: ev::Event| {
            if let Some((id, can_view)) = switch_change(&ev) {
                let page = Rc::clone(&page);
                spawn_local(async move {
                    let _ = page.set_permission(id, can_view).await;
                });
            }
        }
    };

    let on_comment = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(form_el) = submitted_form(&ev) else { return };
        let form = comment_fields(&form_el);
        let page = Rc::clone(&page);
        spawn_local(async move {
            if page.comment(&form).await.is_ok() {
                form_el.reset();
            }
        });
    };

    view! {
        <h2 class="mb-4">"好友"</h2>
        <div class="row g-4">
            <div class="col-lg-4">
                <form class="input-group mb-4" on:submit=on_search>
                    <input type="text" class="form-control" id={ids::SEARCH} placeholder="输入用户名添加好友" />
                    <button type="submit" class="btn btn-primary">"发送请求"</button>
                </form>
                <div class="card mb-4">
                    <div class="card-header">"好友请求"</div>
                    <ul class="list-group list-group-flush" id={ids::REQUESTS} on:click=on_row.clone()></ul>
                </div>
                <div class="card">
                    <div class="card-header">"我的好友"</div>
                    <ul class="list-group list-group-flush" id={ids::FRIENDS} on:click=on_row on:change=on_switch></ul>
                </div>
            </div>
            <div class="col-lg-8">
                <h5 class="mb-3">"好友动态"</h5>
                <div id={ids::FEED} on:submit=on_comment></div>
            </div>
        </div>
    }
}
