//! Resource planning domain models.
//!
//! Provides the data types shared by the store, the booking ledger and the
//! forward scheduler.
//!
//! # Domain Mappings
//!
//! | resource-plan | Project office | Field service |
//! |---------------|----------------|---------------|
//! | Task | Work package | Job |
//! | Allocation | Staffing share | Crew assignment |
//! | Resource | Person | Technician |
//! | Booking | Calendar block | Visit slot |

mod booking;
mod calendar;
mod company;
mod resource;
mod task;

pub use booking::{Booking, BookingState, DocumentKind, DocumentRef};
pub use calendar::{TimeWindow, WorkingHours};
pub use company::{Company, Employee};
pub use resource::Resource;
pub use task::{Allocation, Task, TaskType};
