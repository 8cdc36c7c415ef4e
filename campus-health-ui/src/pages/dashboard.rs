//! Dashboard Page

use std::rc::Rc;

use campus_health::common::dates::{format_date, parse_date, today};
use campus_health::pages::dashboard::{ids, DashboardPage};
use leptos::*;

use super::page_context;
use crate::dom::after_mount;

#[component]
pub fn Dashboard() -> impl IntoView {
    let page = Rc::new(DashboardPage::new(page_context(), today()));

    let first = Rc::clone(&page);
    after_mount(async move {
        first.reconcile(first.date()).await;
    });

    let on_date = move |ev: ev::Event| {
        if let Some(date) = parse_date(&event_target_value(&ev)) {
            let page = Rc::clone(&page);
            spawn_local(async move {
                page.reconcile(date).await;
            });
        }
    };

    view! {
        <div class="d-flex justify-content-between align-items-center mb-4">
            <h2>"你好，" <span id={ids::USERNAME}></span></h2>
            <div class="d-flex align-items-center gap-2">
                <span class="text-muted" id={ids::DATE}></span>
                <input type="date" class="form-control" value={format_date(today())} on:change=on_date />
            </div>
        </div>
        <div id={ids::SUMMARY} class="mt-4"></div>
        <div class="row g-3 mb-4">
            <Card title="睡眠" icon="bi-moon-stars" body={ids::SLEEP_CARD} />
            <Card title="运动" icon="bi-bicycle" body={ids::SPORT_CARD} />
            <Card title="饮食" icon="bi-egg-fried" body={ids::DIET_CARD} />
        </div>
        <div class="card mb-4">
            <div class="card-header">"今日目标"</div>
            <div class="card-body">
                <div id={ids::GOALS}></div>
                <div class="row text-center">
                    <Ring label="睡眠" canvas={ids::SLEEP_RING} percent={ids::SLEEP_PERCENT} />
                    <Ring label="运动" canvas={ids::SPORT_RING} percent={ids::SPORT_PERCENT} />
                    <Ring label="饮食" canvas={ids::DIET_RING} percent={ids::DIET_PERCENT} />
                </div>
            </div>
        </div>
        <div class="card">
            <div class="card-header">"近七日睡眠"</div>
            <div class="card-body">
                <div id={ids::WEEKLY_SLEEP} style="height: 300px;"></div>
            </div>
        </div>
    }
}

#[component]
fn Card(title: &'static str, icon: &'static str, body: &'static str) -> impl IntoView {
    view! {
        <div class="col-md-4">
            <div class="card h-100">
                <div class="card-header"><i class={format!("bi {} me-2", icon)}></i>{title}</div>
                <div class="card-body" id={body}></div>
            </div>
        </div>
    }
}

#[component]
fn Ring(label: &'static str, canvas: &'static str, percent: &'static str) -> impl IntoView {
    view! {
        <div class="col-4">
            <canvas id={canvas} style="max-height: 140px;"></canvas>
            <div class="fw-bold mt-2" id={percent}></div>
            <div class="text-muted small">{label}</div>
        </div>
    }
}
