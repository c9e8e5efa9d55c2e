//! Loyalty points page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use farm2hand_core::loyalty::{EarningRule, earning_rules};
use tracing::instrument;

use crate::filters;
use crate::routes::{ShellView, Tab};
use crate::state::AppState;

/// Reward display data for templates.
#[derive(Clone)]
pub struct RewardView {
    pub title: String,
    pub description: String,
    pub cost: u64,
    pub affordable: bool,
}

/// Points page template.
#[derive(Template, WebTemplate)]
#[template(path = "points/index.html")]
pub struct PointsTemplate {
    pub shell: ShellView,
    pub balance: u64,
    pub lifetime_earned: u64,
    pub monetary_value: String,
    pub rules: [EarningRule; 2],
    pub rewards: Vec<RewardView>,
}

/// Display the points balance, earning rules and rewards.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store();
    let account = store.loyalty();

    PointsTemplate {
        shell: ShellView::new(&state, Tab::Points),
        balance: account.balance,
        lifetime_earned: account.lifetime_earned,
        monetary_value: account.monetary_value().display(),
        rules: earning_rules(),
        rewards: store
            .rewards()
            .iter()
            .map(|reward| RewardView {
                title: reward.title.clone(),
                description: reward.description.clone(),
                cost: reward.cost,
                affordable: account.can_afford(reward),
            })
            .collect(),
    }
}
