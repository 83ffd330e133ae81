pub mod deeplink;
pub mod route;
pub mod router;

pub use deeplink::{Deeplink, DeeplinkSource, ParsedUrl, build_url, parse_url};
pub use route::{Route, Segment};
pub use router::{DeeplinkHandler, Deeplinking};
