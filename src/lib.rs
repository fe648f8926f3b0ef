//! Interactive annotation engine for rendered PDF pages.
//!
//! The crate sits between a page renderer and the host application. It turns
//! pointer, wheel, keyboard and selection events over a rendered page into
//! annotation mutations (comments, rectangles and text highlights), owns the
//! pan/zoom state of the page surface, and resolves which rendered text lies
//! beneath a rectangle. The host renders the document, persists the resulting
//! [`engine::Action`]s, and feeds back its own scale and page changes.
//!
//! Everything except [`dom`] is free of browser dependencies and is driven
//! natively by the tests and the `pagemark-replay` binary.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction state machine and the testable [`engine::EngineCore`] |
//! | [`store`] | Annotation collection with host callbacks |
//! | [`annotation`] | Annotation model and sparse updates |
//! | [`viewport`] | Scale and pan state |
//! | [`transform`] | Screen/document coordinate conversion |
//! | [`geometry`] | Bounds normalization and edge arithmetic |
//! | [`text`] | Text-overlap resolution against the text layer |
//! | [`selection`] | Native text selection capability |
//! | [`hit`] | Hit-testing annotations, handles and delete controls |
//! | [`input`] | Tools, input event types and gesture state |
//! | [`overlay`] | Screen-space layout of visible annotations |
//! | [`pages`] | Current page and page count |
//! | [`config`] | Host configuration and thresholds |
//! | [`replay`] | Scripted sessions on a virtual clock |
//! | [`dom`] | Browser bindings (feature `dom`) |
//! | [`consts`] | Shared numeric constants (thresholds, zoom limits, hit slop) |

pub mod annotation;
pub mod config;
pub mod consts;
#[cfg(feature = "dom")]
pub mod dom;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod pages;
pub mod replay;
pub mod selection;
pub mod store;
pub mod text;
pub mod transform;
pub mod viewport;
