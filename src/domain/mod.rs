pub mod meal_time;
pub mod otp;
pub mod phone_number;
pub mod status;
pub mod summary;
pub mod user_email;

pub use meal_time::MealTime;
pub use phone_number::PhoneNumberDomain;
pub use status::{PaymentStatus, UserRole, UserStatus};
pub use summary::UserSummary;
pub use user_email::UserEmail;
