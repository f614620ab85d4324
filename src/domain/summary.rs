use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Market, Meal, PublicUser, User};

/// A user joined with everything they recorded, plus the two numbers the
/// mess settles accounts with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary{
    #[serde(flatten)]
    pub user: PublicUser,
    pub markets: Vec<Market>,
    pub meals: Vec<Meal>,
    pub total_amount: f64,
    pub total_meal: u32
}

impl UserSummary {
    pub fn build(user: User, markets: Vec<Market>, meals: Vec<Meal>) -> Self {
        let total_amount = total_amount(&markets);
        let total_meal = total_meal(&meals);

        UserSummary{
            user: user.into(),
            markets,
            meals,
            total_amount,
            total_meal
        }
    }

    /// Builds one summary per user. Records owned by anyone outside `users`
    /// are ignored.
    pub fn build_all(users: Vec<User>, markets: Vec<Market>, meals: Vec<Meal>) -> Vec<Self> {
        let mut markets_by_owner: HashMap<Uuid, Vec<Market>> = HashMap::new();
        for market in markets {
            markets_by_owner.entry(market.user_id).or_default().push(market);
        }

        let mut meals_by_owner: HashMap<Uuid, Vec<Meal>> = HashMap::new();
        for meal in meals {
            meals_by_owner.entry(meal.user_id).or_default().push(meal);
        }

        users.into_iter()
            .map(|user| {
                let markets = markets_by_owner.remove(&user.user_id).unwrap_or_default();
                let meals = meals_by_owner.remove(&user.user_id).unwrap_or_default();
                UserSummary::build(user, markets, meals)
            })
            .collect()
    }
}

pub fn total_amount(markets: &[Market]) -> f64 {
    markets.iter().map(|market| market.amount).sum()
}

pub fn total_meal(meals: &[Meal]) -> u32 {
    meals.iter().map(Meal::weight).sum()
}
