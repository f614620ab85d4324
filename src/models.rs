use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::MealTime;
use crate::schema::markets;
use crate::schema::meals;
use crate::schema::users;

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: String,
    pub user_status: String,
    pub payment: String,
    pub gas_bill: String,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub otp_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

// What the API is allowed to show about a user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser{
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub user_status: String,
    pub payment: String,
    pub gas_bill: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser{
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            user_status: user.user_status,
            payment: user.payment,
            gas_bill: user.gas_bill,
            created_at: user.created_at,
            updated_at: user.updated_at
        }
    }
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = users)]
pub struct UserChangeset{
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub updated_at: Option<DateTime<Utc>>
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = users)]
pub struct AdminUserChangeset{
    pub role: Option<String>,
    pub user_status: Option<String>,
    pub payment: Option<String>,
    pub gas_bill: Option<String>,
    pub updated_at: Option<DateTime<Utc>>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = markets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Market{
    pub market_id: Uuid,
    pub user_id: Uuid,
    pub items: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = markets)]
pub struct MarketChangeset{
    pub items: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Meal{
    pub meal_id: Uuid,
    pub user_id: Uuid,
    pub meal_time: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>
}

impl Meal {
    // "both" counts twice, anything else once
    pub fn weight(&self) -> u32 {
        self.meal_time
            .parse::<MealTime>()
            .map(MealTime::weight)
            .unwrap_or(1)
    }
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = meals)]
pub struct MealChangeset{
    pub meal_time: Option<String>,
    pub date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>
}
