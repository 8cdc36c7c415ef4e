//! Diet Page

use std::rc::Rc;

use campus_health::common::dates::{format_date, parse_date, today};
use campus_health::models::MealType;
use campus_health::pages::diet::{ids, DietPage};
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form, row_action};

const MEAL_TYPES: [MealType; 4] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];

#[component]
pub fn Diet() -> impl IntoView {
    let page = Rc::new(DietPage::new(page_context(), today()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.load_foods().await;
        first.reconcile(today()).await;
        first.load_recommendations().await;
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

    let on_add = {
        let page = Rc::clone(&page);
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let form = read_form(&[ids::MEAL_TYPE, ids::FOOD, ids::PORTION]);
            let page = Rc::clone(&page);
            spawn_local(async move {
                let _ = page.add_food(&form).await;
            });
        }
    };

    let on_edit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let form = read_form(&[ids::EDIT_ITEM_ID, ids::EDIT_PORTION]);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let _ = page.update_portion(&form).await;
        });
    };

    view! {
        <div class="d-flex justify-content-between align-items-center mb-4">
            <h2>"饮食记录"</h2>
            <input type="date" class="form-control w-auto" value={format_date(today())} on:change=on_date />
        </div>
        <div class="row g-4">
            <div class="col-lg-4">
                <form class="card card-body mb-4" on:submit=on_add>
                    <label class="form-label" for={ids::MEAL_TYPE}>"餐次"</label>
                    <select class="form-select mb-3" id={ids::MEAL_TYPE}>
                        {MEAL_TYPES
                            .into_iter()
                            .map(|t| view! { <option value={t.as_str()}>{t.label()}</option> })
                            .collect_view()}
                    </select>
                    <label class="form-label" for={ids::FOOD}>"食物"</label>
                    <input class="form-control mb-3" id={ids::FOOD} list={ids::FOOD_LIST} placeholder="输入以搜索食物" />
                    <datalist id={ids::FOOD_LIST}></datalist>
                    <label class="form-label" for={ids::PORTION}>"份量（份）"</label>
                    <input type="number" min="0.1" step="0.1" value="1" class="form-control mb-3" id={ids::PORTION} />
                    <button type="submit" class="btn btn-primary">"添加"</button>
                </form>
                <div id={ids::RECOMMENDATIONS}></div>
            </div>
            <div class="col-lg-8">
                <div class="d-flex justify-content-end mb-2">
                    "今日总摄入: " <strong class="mx-1" id={ids::TOTAL}>"0"</strong> " 大卡"
                </div>
                <div id={ids::MEALS} on:click=on_row></div>
            </div>
        </div>

        <div class="modal fade" id={ids::EDIT_MODAL} tabindex="-1" aria-hidden="true">
            <div class="modal-dialog">
                <form class="modal-content" on:submit=on_edit>
                    <div class="modal-header">
                        <h5 class="modal-title">"修改份量"</h5>
                        <button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button>
                    </div>
                    <div class="modal-body">
                        <input type="hidden" id={ids::EDIT_ITEM_ID} />
                        <label class="form-label" for={ids::EDIT_FOOD_NAME}>"食物"</label>
                        <input type="text" class="form-control mb-3" id={ids::EDIT_FOOD_NAME} readonly />
                        <label class="form-label" for={ids::EDIT_PORTION}>"份量（份）"</label>
                        <input type="number" min="0.1" step="0.1" class="form-control" id={ids::EDIT_PORTION} />
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
