// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// InkBridge — engine handle, content sessions, and the serialized facade.
//
// `BridgeCore` is the synchronous state machine: one engine handle, at most
// one content session. `InkBridge` moves a core onto a dedicated worker
// thread and exposes every operation as a `Pending` future, so callers on
// any thread can share the engine without ever reentering it.

mod bridge;
mod bridge_core;
mod handle;
mod pending;
mod session;

pub use bridge::InkBridge;
pub use bridge_core::BridgeCore;
pub use handle::EngineHandle;
pub use pending::Pending;
pub use session::ContentSession;
