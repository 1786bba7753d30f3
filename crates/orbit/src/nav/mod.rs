pub mod controller;
pub mod geometry;
pub mod input;
pub mod item;
pub mod state;
pub mod subscribers;
pub mod timer;

pub use controller::NavigationController;
pub use geometry::{HitTarget, Point, radial_position};
pub use input::{Key, PointerEvent, PointerSource, PressTarget};
pub use item::{ItemId, NavigationItem};
pub use state::{EventKind, MenuPhase, NavigationEvent, NavigationState};
pub use subscribers::Subscription;
pub use timer::{Clock, ManualClock, SystemClock};

pub const DEFAULT_ANIMATION_MS: u64 = 300;
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 300;
pub const DEFAULT_RADIUS: f64 = 120.0; // item orbital radius
pub const DEFAULT_CENTER_SIZE: f64 = 64.0; // center button diameter
pub const DEFAULT_ITEM_SIZE: f64 = 48.0; // item button diameter
pub const DEFAULT_START_ANGLE: f64 = 0.0; // degrees, 0 = east
