mod auth;
pub mod endpoints;
mod errors;
pub mod extract;
mod fetch;
pub mod normalize;
mod session;
mod ticket;
pub mod types;
pub mod user_agent;
pub use self::auth::{login, Credentials};
pub use self::endpoints::Endpoints;
pub use self::errors::{Error, ShapeError, Step};
pub use self::fetch::{fetch_periods, FetchReport, SkippedPeriod};
pub use self::session::{Authenticated, Authorized, Session};
pub use self::ticket::authorize;
pub use self::types::{CourseGrade, GradeDetail, PeriodId, PeriodPayload, StudentId};
