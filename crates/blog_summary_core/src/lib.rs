pub mod domain;
pub mod ports;
pub mod session;
pub mod summary;

pub use domain::{NewUser, Session, SiteOutcome, SiteSummary, Source, SummaryResult, User, UserCredentials};
pub use ports::{PortError, PortResult, SessionStorage, SummaryService, UserRepository};
pub use session::{MemorySessionStorage, SessionState};
