pub mod behavioral;
pub mod page;
pub mod resolve;
pub mod session;
pub mod stealth;

pub use page::{ElementHandle, LivePage, PageSurface, Selector};
pub use resolve::{resolve, SelectorCandidate};
pub use session::{LaunchOptions, StealthSession};
