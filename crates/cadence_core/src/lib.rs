pub mod analytics;
pub mod domain;
pub mod ports;
pub mod progress;
pub mod schedule;

pub use domain::{
    AuthSession, Goal, GoalUpdate, NewGoal, NewSession, Session, SessionUpdate, User,
    UserCredentials,
};
pub use ports::{HabitStore, PortError, PortResult};
pub use progress::DEFAULT_WEEKLY_TARGET;
pub use schedule::{GoalStatus, ScheduleUpdate, ScheduledGoal};
