//! Health Articles Page

use std::rc::Rc;

use campus_health::pages::articles::{ids, ArticleFilter, ArticlesPage};
use campus_health::pages::RowAction;
use leptos::*;

use super::page_context;
use crate::dom::{after_mount, read_form, row_action};

#[component]
pub fn Articles() -> impl IntoView {
    let page = Rc::new(ArticlesPage::new(page_context()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.load_categories().await;
        first.reconcile().await;
    });

    let refilter = {
        let page = Rc::clone(&page);
        move |_: ev::Event| {
            let form = read_form(&[ids::CATEGORIES, ids::SEARCH]);
            page.set_filter(ArticleFilter::new(form.get(ids::CATEGORIES), form.get(ids::SEARCH)));
        }
    };

    let on_card = move |ev: ev::MouseEvent| {
        if let Some(RowAction::View(id)) = row_action(&ev) {
            let page = Rc::clone(&page);
            spawn_local(async move {
                let _ = page.view(id).await;
            });
        }
    };

    view! {
        <h2 class="mb-4">"健康知识"</h2>
        <div class="row g-2 mb-4">
            <div class="col-md-4">
                <select class="form-select" id={ids::CATEGORIES} on:change=refilter.clone()>
                    <option value="">"全部分类"</option>
                </select>
            </div>
            <div class="col-md-8">
                <input type="search" class="form-control" id={ids::SEARCH} placeholder="搜索标题或内容..." on:input=refilter />
            </div>
        </div>
        <div class="row g-3" id={ids::LIST} on:click=on_card></div>
        <div class="text-center text-muted py-5 d-none" id={ids::EMPTY}>"没有找到相关文章"</div>

        <div class="modal fade" id={ids::MODAL} tabindex="-1" aria-labelledby={ids::DETAIL_TITLE} aria-hidden="true">
            <div class="modal-dialog modal-lg modal-dialog-scrollable">
                <div class="modal-content">
                    <div class="modal-header">
                        <h5 class="modal-title" id={ids::DETAIL_TITLE}></h5>
                        <button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button>
                    </div>
                    <div class="modal-body">
                        <div class="text-muted small mb-3">
                            <span class="badge bg-primary me-2" id={ids::DETAIL_CATEGORY}></span>
                            <span class="me-2" id={ids::DETAIL_AUTHOR}></span>
                            <span class="me-2" id={ids::DETAIL_DATE}></span>
                            <i class="bi bi-eye me-1"></i><span id={ids::DETAIL_VIEWS}></span>
                        </div>
                        <div id={ids::DETAIL_CONTENT}></div>
                    </div>
                </div>
            </div>
        </div>
    }
}
