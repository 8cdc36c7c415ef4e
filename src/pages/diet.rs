//! Diet Page
//!
//! Meals for one day, each holding food items from the shared library. Adding a
//! food first finds or creates the meal for its type, then attaches the item.

use chrono::NaiveDate;
use serde::Serialize;
use std::cell::Cell;
use tracing::debug;

use super::{clear_fields, reject_invalid, ActionError, ActionResult, RowAction};
use crate::common::dates::format_date;
use crate::error::ApiResult;
use crate::forms::{FormValues, ValidationError};
use crate::host::Host;
use crate::http::{Method, Transport};
use crate::models::{DietRecommendations, FoodItem, Meal, MealItem, MealType};
use crate::render::{self, escape_html, fixed};
use crate::sync::{confirmed, run_mutation_with, Container, LoadKind, LoadOutcome, PageContext};

pub const FOODS_PATH: &str = "/api/foods/";
pub const MEALS_PATH: &str = "/api/meals/";
pub const MEAL_ITEMS_PATH: &str = "/api/meal-items/";
pub const RECOMMENDATIONS_PATH: &str = "/api/recommendations/diet/";

pub mod ids {
    pub const MEALS: &str = "diet-details-container";
    pub const TOTAL: &str = "total-calories-eaten-display";
    pub const FOOD_LIST: &str = "food-datalist";
    pub const RECOMMENDATIONS: &str = "diet-recommendations";
    pub const MEAL_TYPE: &str = "meal-type";
    pub const FOOD: &str = "food-item";
    pub const PORTION: &str = "portion";
    pub const EDIT_MODAL: &str = "editMealItemModal";
    pub const EDIT_ITEM_ID: &str = "edit-item-id";
    pub const EDIT_FOOD_NAME: &str = "edit-food-name";
    pub const EDIT_PORTION: &str = "edit-portion";
}

const UNKNOWN_FOOD: &str = "请从列表中选择一个有效的食物！";
const INVALID_PORTION: &str = "请输入有效的份量！";

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NewMeal<'a> {
    record_date: &'a str,
    meal_type: &'a str,
}

/// Body of POST `/api/meal-items/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealItemInput {
    pub meal: u64,
    pub food_item: u64,
    pub portion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct PortionPatch {
    portion: f64,
}

/// Validated add-food form, before the meal id is known
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    pub meal_type: MealType,
    pub food_id: u64,
    pub portion: f64,
}

impl FoodEntry {
    /// The food name must match a library entry exactly
    pub fn from_form(form: &FormValues, library: &[FoodItem]) -> Result<Self, ValidationError> {
        let meal_type = MealType::parse(form.get(ids::MEAL_TYPE))
            .ok_or_else(|| ValidationError::new("请选择餐次！"))?;
        let name = form.get(ids::FOOD);
        let food = library
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ValidationError::new(UNKNOWN_FOOD))?;
        let portion = form.positive(ids::PORTION, INVALID_PORTION)?;
        Ok(Self { meal_type, food_id: food.id, portion })
    }
}

pub fn day_total(meals: &[Meal]) -> f64 {
    meals.iter().map(|m| m.total_calories).fold(0.0, |acc, c| acc + c)
}

fn render_item(item: &MealItem) -> String {
    let name = escape_html(&item.food_item_name);
    format!(
        r#"<li class="list-group-item d-flex justify-content-between align-items-center"><div>{name} <span class="text-muted">({portion}克)</span></div><div><span class="badge bg-primary rounded-pill me-2">{kcal} 大卡</span><button type="button" class="btn btn-sm btn-outline-secondary me-1" data-action="edit" data-id="{id}" data-food-name="{name}" data-portion="{portion}">修改</button><button type="button" class="btn btn-sm btn-outline-danger" data-action="delete" data-id="{id}">删除</button></div></li>"#,
        name = name,
        portion = item.portion,
        kcal = fixed(item.calories_calculated, 0),
        id = item.id,
    )
}

pub fn render_meals(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return render::empty_paragraph("当日暂无饮食记录");
    }
    meals
        .iter()
        .map(|meal| {
            let items = if meal.meal_items.is_empty() {
                r#"<li class="list-group-item text-muted">暂无食物</li>"#.to_string()
            } else {
                meal.meal_items.iter().map(render_item).collect()
            };
            format!(
                r#"<div class="card mb-3"><div class="card-header d-flex justify-content-between"><strong>{label}</strong><strong>总计: {total} 大卡</strong></div><ul class="list-group list-group-flush">{items}</ul></div>"#,
                label = MealType::label_for(&meal.meal_type),
                total = fixed(meal.total_calories, 0),
                items = items,
            )
        })
        .collect()
}

pub fn render_food_options(foods: &[FoodItem]) -> String {
    foods
        .iter()
        .map(|f| {
            format!(
                r#"<option value="{}" data-id="{}" data-calories="{}"></option>"#,
                escape_html(&f.name),
                f.id,
                f.calories_per_100g
            )
        })
        .collect()
}

pub fn render_recommendations(recs: &DietRecommendations) -> String {
    if recs.summary.is_none() && recs.recommendations.is_empty() {
        return render::empty_paragraph("暂无饮食建议");
    }
    let mut html = String::new();
    if let Some(summary) = &recs.summary {
        html.push_str(&format!(r#"<p class="mb-2">{}</p>"#, escape_html(summary)));
    }
    html.push_str(r#"<ul class="list-unstyled mb-0">"#);
    for rec in &recs.recommendations {
        html.push_str(&format!(
            r#"<li class="mb-2"><strong>{}</strong><div class="small text-muted">{}</div>"#,
            escape_html(&rec.title),
            escape_html(&rec.description)
        ));
        if !rec.foods.is_empty() {
            let foods: Vec<String> = rec.foods.iter().map(|f| escape_html(f)).collect();
            html.push_str(&format!(r#"<div class="small">推荐食物: {}</div>"#, foods.join("、")));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

pub struct DietPage<T, H> {
    ctx: PageContext<T, H>,
    meals: Container<Vec<Meal>>,
    foods: Container<Vec<FoodItem>>,
    recommendations: Container<DietRecommendations>,
    date: Cell<NaiveDate>,
}

impl<T: Transport, H: Host> DietPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, date: NaiveDate) -> Self {
        Self {
            ctx,
            meals: Container::new(ids::MEALS).with_error_markup(render::error_paragraph),
            foods: Container::new(ids::FOOD_LIST),
            recommendations: Container::new(ids::RECOMMENDATIONS)
                .with_degraded_markup(render::empty_paragraph("暂时无法获取饮食建议")),
            date: Cell::new(date),
        }
    }

    /// Fill the food datalist. A failure leaves the page usable.
    pub async fn load_foods(&self) -> LoadOutcome<Vec<FoodItem>> {
        let fetch = self.ctx.client.get(FOODS_PATH, &[]);
        let outcome = self.foods.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(foods) = &outcome {
            self.ctx.host.render(ids::FOOD_LIST, render_food_options(foods));
        }
        outcome
    }

    pub async fn load_recommendations(&self) -> LoadOutcome<DietRecommendations> {
        let fetch = self.ctx.client.get(RECOMMENDATIONS_PATH, &[]);
        let outcome = self.recommendations.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(recs) = &outcome {
            self.ctx.host.render(ids::RECOMMENDATIONS, render_recommendations(recs));
        }
        outcome
    }

    pub async fn reconcile(&self, date: NaiveDate) -> LoadOutcome<Vec<Meal>> {
        self.date.set(date);
        let day = format_date(date);
        let query = [("record_date", day.as_str())];
        let fetch = self.ctx.client.get(MEALS_PATH, &query);
        let outcome = self.meals.load(&self.ctx, LoadKind::Primary, fetch).await;

        if let LoadOutcome::Applied(meals) = &outcome {
            self.ctx.host.render(ids::MEALS, render_meals(meals));
            self.ctx.host.set_text(ids::TOTAL, &fixed(day_total(meals), 0));
        }
        outcome
    }

    /// Id of the meal for `(date, meal_type)`, created when it does not exist yet
    pub async fn get_or_create_meal(&self, date: NaiveDate, meal_type: MealType) -> ApiResult<u64> {
        let day = format_date(date);
        let existing: Vec<Meal> = self
            .ctx
            .client
            .get(MEALS_PATH, &[("record_date", day.as_str()), ("meal_type", meal_type.as_str())])
            .await?;
        if let Some(meal) = existing.first() {
            return Ok(meal.id);
        }

        debug!(date = %day, meal_type = meal_type.as_str(), "creating meal");
        let body = NewMeal { record_date: &day, meal_type: meal_type.as_str() };
        let created: Meal = self.ctx.client.send(Method::Post, MEALS_PATH, &body).await?;
        Ok(created.id)
    }

    pub async fn add_food(&self, form: &FormValues) -> ActionResult {
        let library = self.foods.view().unwrap_or_default();
        let entry = FoodEntry::from_form(form, &library).map_err(|e| reject_invalid(&self.ctx.host, e))?;
        let date = self.date.get();

        let request = async {
            let meal = self.get_or_create_meal(date, entry.meal_type).await?;
            let body = MealItemInput { meal, food_item: entry.food_id, portion: entry.portion };
            self.ctx.client.send::<_, MealItem>(Method::Post, MEAL_ITEMS_PATH, &body).await
        };
        run_mutation_with(&self.ctx, request, "食物添加成功！", "提交失败: ").await?;

        clear_fields(&self.ctx.host, &[ids::FOOD, ids::PORTION]);
        self.reconcile(date).await;
        Ok(())
    }

    pub async fn handle(&self, action: RowAction) -> ActionResult {
        match action {
            RowAction::Edit(id) => self.open_edit(id),
            RowAction::Delete(id) => self.delete_item(id).await,
            _ => Ok(()),
        }
    }

    /// Prefill the portion modal from the cached meal view
    pub fn open_edit(&self, item_id: u64) -> ActionResult {
        let item = self
            .meals
            .with_view(|meals| {
                meals
                    .iter()
                    .flat_map(|m| m.meal_items.iter())
                    .find(|i| i.id == item_id)
                    .cloned()
            })
            .flatten();
        let Some(item) = item else {
            debug!(item_id, "edit requested for item not in view");
            return Ok(());
        };

        let host = &self.ctx.host;
        host.set_value(ids::EDIT_ITEM_ID, &item.id.to_string());
        host.set_value(ids::EDIT_FOOD_NAME, &item.food_item_name);
        host.set_value(ids::EDIT_PORTION, &item.portion.to_string());
        host.show_modal(ids::EDIT_MODAL, true);
        Ok(())
    }

    pub async fn update_portion(&self, form: &FormValues) -> ActionResult {
        let parsed = form
            .get(ids::EDIT_ITEM_ID)
            .parse::<u64>()
            .map_err(|_| ValidationError::new(INVALID_PORTION))
            .and_then(|id| Ok((id, form.positive(ids::EDIT_PORTION, INVALID_PORTION)?)));
        let (id, portion) = parsed.map_err(|e| reject_invalid(&self.ctx.host, e))?;

        let path = format!("{}{}/", MEAL_ITEMS_PATH, id);
        run_mutation_with(
            &self.ctx,
            self.ctx.client.send::<_, MealItem>(Method::Patch, &path, &PortionPatch { portion }),
            "修改成功！",
            "修改失败: ",
        )
        .await?;

        self.ctx.host.show_modal(ids::EDIT_MODAL, false);
        self.reconcile(self.date.get()).await;
        Ok(())
    }

    pub async fn delete_item(&self, id: u64) -> ActionResult {
        if !confirmed(&self.ctx.host, "您确定要删除这条食物记录吗？") {
            return Err(ActionError::Cancelled);
        }
        let path = format!("{}{}/", MEAL_ITEMS_PATH, id);
        run_mutation_with(&self.ctx, self.ctx.client.delete(&path), "删除成功！", "删除失败: ").await?;
        self.reconcile(self.date.get()).await;
        Ok(())
    }
}
