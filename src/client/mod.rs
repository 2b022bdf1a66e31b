//! Visitor-side flows of the site: lead capture, the booking widget and the
//! post-booking confirmation. Everything here is UI-framework agnostic; the
//! page shell renders whatever state these types expose.

pub mod api;
pub mod confirmation;
pub mod events;
pub mod form;
pub mod storage;
pub mod timer;
pub mod validation;
pub mod widget;
