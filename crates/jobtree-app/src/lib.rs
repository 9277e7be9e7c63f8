//! Headless side of the job admin tool: the remote API seam, the job panel
//! controller and the worker that runs API calls off the UI thread.

pub mod controller;
pub mod panel;
pub mod request;
pub mod service;

pub use controller::AppController;
pub use panel::{Confirmation, JobPanel, JobRow, Notice, NoticeLevel, NotificationSink};
pub use request::Request;
pub use service::{JobService, MemoryJobService};
