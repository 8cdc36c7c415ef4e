//! Login and Registration Pages

use std::rc::Rc;

use campus_health::pages::auth::{ids, AuthPage};
use leptos::*;
use leptos_router::A;

use super::page_context;
use crate::dom::read_form;

#[component]
pub fn Login() -> impl IntoView {
    let page = Rc::new(AuthPage::new(page_context()));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::USERNAME, ids::PASSWORD]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.login(&form).await;
        });
    };

    view! {
        <div class="row justify-content-center">
            <div class="col-md-5">
                <h2 class="mb-4 text-center">"登录"</h2>
                <form class="card card-body" on:submit=on_submit>
                    <input type="text" class="form-control mb-3" id={ids::USERNAME} placeholder="用户名" autocomplete="username" />
                    <input type="password" class="form-control mb-3" id={ids::PASSWORD} placeholder="密码" autocomplete="current-password" />
                    <button type="submit" class="btn btn-primary w-100">"登录"</button>
                    <div class="d-none mt-3" id={ids::RESPONSE}></div>
                </form>
                <p class="text-center mt-3">"还没有账号？" <A href="/register/">"立即注册"</A></p>
            </div>
        </div>
    }
}

#[component]
pub fn Register() -> impl IntoView {
    let page = Rc::new(AuthPage::new(page_context()));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::USERNAME, ids::EMAIL, ids::PASSWORD, ids::PASSWORD_CONFIRM]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.register(&form).await;
        });
    };

    view! {
        <div class="row justify-content-center">
            <div class="col-md-5">
                <h2 class="mb-4 text-center">"注册"</h2>
                <form class="card card-body" on:submit=on_submit>
                    <input type="text" class="form-control mb-3" id={ids::USERNAME} placeholder="用户名" autocomplete="username" />
                    <input type="email" class="form-control mb-3" id={ids::EMAIL} placeholder="邮箱" />
                    <input type="password" class="form-control mb-3" id={ids::PASSWORD} placeholder="密码" autocomplete="new-password" />
                    <input type="password" class="form-control mb-3" id={ids::PASSWORD_CONFIRM} placeholder="确认密码" autocomplete="new-password" />
                    <button type="submit" class="btn btn-success w-100">"注册"</button>
                    <div class="d-none mt-3" id={ids::RESPONSE}></div>
                </form>
                <p class="text-center mt-3">"已有账号？" <A href="/login/">"去登录"</A></p>
            </div>
        </div>
    }
}
