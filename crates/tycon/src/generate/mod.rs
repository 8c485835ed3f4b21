// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Implementation generation.
//!
//! The fast path of the factory layer is an ahead-of-time one: the
//! [`source`] emitter turns a descriptor into Rust source for a
//! strongly-typed implementation struct, the `tycon-gen` tool runs it at
//! build time, and the compiled-in result registers its two standard
//! constructors in the process-wide [`registry`]. At runtime,
//! [`ImplCompiler::compile`] first checks the registry (a hit means the
//! implementation is linked into this binary); on a miss it emits and
//! verifies fresh source into the generation directory for the next
//! build, and reports the miss as a recoverable [`GenerationError`] that
//! the factory layer turns into a generic fallback.

mod compiler;
mod registry;
pub mod source;

pub use compiler::{Diagnostic, GenDirCompiler, ImplCompiler, ImplModule};
pub use registry::{lookup_impl, register_impl, CtorCopy, CtorNew, ImplBinary};
