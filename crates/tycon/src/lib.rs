// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tycon - Typed Configuration Items
//!
//! Instantiation core for declaratively described configuration types:
//! schemas in, live observable instances out.
//!
//! ## Quick Start
//!
//! ```rust
//! use tycon::{ConfigDescriptor, FactoryContext, Location, PropertyDescriptor, PropertyType};
//!
//! # fn main() -> Result<(), tycon::ConfigError> {
//! let descriptor = ConfigDescriptor::builder("example.Server")
//!     .property(PropertyDescriptor::plain("port", PropertyType::Int).with_default(8080i64))
//!     .property(PropertyDescriptor::list("hosts", PropertyType::Str))
//!     .build()?;
//!
//! let context = FactoryContext::generic_only();
//! let mut server = context.new_item(&descriptor, Location::none());
//!
//! assert_eq!(server.value("port")?.as_i64(), Some(8080));
//! server.list_mut("hosts")?.push("db1")?;
//! assert!(server.list("hosts")?.is_modified());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                      FactoryContext                          |
//! |   strategy selection | memoization | fallback-to-generic     |
//! +--------------------------------------------------------------+
//! |        ItemFactory = Compiled | Generic                      |
//! |   standard-constructor dispatch | slot-backed items          |
//! +--------------------------------------------------------------+
//! |                 ConfigItem instances                         |
//! |   plain values | ObservableList / ObservableMap | listeners  |
//! +--------------------------------------------------------------+
//! |          generate: emitter | registry | compiler             |
//! |   build-time source emission, link-time constructor lookup   |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConfigDescriptor`] | Immutable schema of one configuration type |
//! | [`ConfigItem`] | One live instance, any representation |
//! | [`ItemBuilder`] | Staged property values for copy construction |
//! | [`FactoryContext`] | Strategy selection, memoization and fallback |
//! | [`ObservableList`] / [`ObservableMap`] | Collection properties with change notification |

pub mod change;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod generate;
pub mod item;
pub mod location;
pub mod observable;
pub mod value;

pub use change::{
    null_handler, ChangeHandler, HandlerRef, Listener, ListenerHandle, ListenerSet, NullHandler,
    PropertyEvent, MAP_INDEX,
};
pub use descriptor::{
    ConfigDescriptor, DescriptorBuilder, PropertyDescriptor, PropertyKind, PropertyType,
};
pub use error::{ConfigError, GenerationError};
pub use factory::{CompiledFactory, FactoryContext, GenericFactory, ItemFactory};
pub use item::{items_equal, ConfigItem, GenericItem, ItemBuilder};
pub use location::Location;
pub use observable::{ObservableList, ObservableMap};
pub use value::ConfigValue;
