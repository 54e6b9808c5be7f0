//! wv: verification engine for embedded chat widgets.
//!
//! Partner sites embed a third-party chat widget as an iframe, optionally
//! accompanied by a smaller notification badge iframe that can also open the
//! chat. This crate checks two things against a live partner page:
//!
//! * the widget is rendered: an iframe matching the known container marker is
//!   attached, visible, and laid out sanely inside the viewport
//!   ([`discovery`], [`geometry`]);
//! * the widget is wired up: the chat can be opened (directly, or through the
//!   badge with a bounded retry), its order-tracking action clicked, and the
//!   bot backend answers with the authorization form ([`activation`],
//!   [`scenario`]).
//!
//! All browser access goes through the capability traits in [`driver`]; the
//! [`webdriver`] module implements them over a WebDriver session, and tests
//! script them with fakes.

pub mod activation;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod scenario;
pub mod webdriver;

pub use activation::{ActivationAttempt, ChatActivator, Trigger};
pub use config::{PartnerTarget, VerifyConfig, WidgetSelectors};
pub use discovery::{ElementKind, WidgetCandidate};
pub use driver::{FrameHandle, HostPage};
pub use error::{Result, VerifyError};
pub use geometry::{BoundingGeometry, ViewportExtent, is_valid_widget_geometry};
pub use scenario::{ScenarioKind, ScenarioResult, ScenarioRunner};
pub use webdriver::WebDriverPage;
