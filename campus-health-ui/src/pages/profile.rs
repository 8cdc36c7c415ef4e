//! Profile Page

use std::rc::Rc;

use campus_health::pages::profile::{ids, ProfilePage, SUBMIT_LABEL};
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form};

#[component]
pub fn Profile() -> impl IntoView {
    let page = Rc::new(ProfilePage::new(page_context()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile().await;
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::EMAIL, ids::GENDER, ids::DATE_OF_BIRTH]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.submit(&form).await;
        });
    };

    view! {
        <div class="row justify-content-center">
            <div class="col-lg-6">
                <h2 class="mb-4">"个人档案"</h2>
                <div id={ids::STATUS}></div>
                <form class="card card-body" on:submit=on_submit>
                    <p class="mb-3">"用户名: " <strong id={ids::USERNAME}></strong></p>
                    <label class="form-label" for={ids::EMAIL}>"邮箱"</label>
                    <input type="email" class="form-control mb-3" id={ids::EMAIL} />
                    <label class="form-label" for={ids::GENDER}>"性别"</label>
                    <select class="form-select mb-3" id={ids::GENDER}>
                        <option value="">"未设置"</option>
                        <option value="M">"男"</option>
                        <option value="F">"女"</option>
                    </select>
                    <label class="form-label" for={ids::DATE_OF_BIRTH}>"出生日期"</label>
                    <input type="date" class="form-control mb-3" id={ids::DATE_OF_BIRTH} />
                    <button type="submit" class="btn btn-primary" id={ids::SUBMIT}>{SUBMIT_LABEL}</button>
                </form>
            </div>
        </div>
    }
}
