//! Traversal progress observer seam.
//!
//! # Responsibility
//! - Report creation, reuse, configuration and recovered-workflow events to
//!   an explicitly injected interface instead of a process-global logger.
//!
//! # Invariants
//! - Events are informational; observers must not influence traversal.

use log::{info, warn};

/// One progress event during materialization. Paths are full object paths in
/// the store; lifetimes borrow from the running traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeEvent<'a> {
    /// A new object was created.
    ItemCreated { path: &'a str, type_name: &'a str },
    /// The id already existed; creation was skipped.
    ItemReused { path: &'a str },
    /// One configuration step was applied.
    StepApplied { path: &'a str, step: &'a str },
    /// All configuration steps for the object completed.
    ItemConfigured { path: &'a str },
    /// A workflow transition was reported not applicable and skipped.
    WorkflowSkipped {
        path: &'a str,
        action: &'a str,
        reason: &'a str,
    },
    /// A container's default-child pointer was set.
    DefaultPageSet { container: &'a str, id: &'a str },
}

/// Receiver for materialization progress events.
pub trait MaterializeObserver {
    /// Called once per event, in traversal order.
    fn on_event(&self, event: &MaterializeEvent<'_>);
}

/// Default observer forwarding events to the `log` facade in structured
/// line format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl MaterializeObserver for LogObserver {
    fn on_event(&self, event: &MaterializeEvent<'_>) {
        match event {
            MaterializeEvent::ItemCreated { path, type_name } => {
                info!("event=item_created module=materializer status=ok path={path} type={type_name}");
            }
            MaterializeEvent::ItemReused { path } => {
                info!("event=item_reused module=materializer status=ok path={path}");
            }
            MaterializeEvent::StepApplied { path, step } => {
                info!("event=step_applied module=materializer status=ok path={path} step={step}");
            }
            MaterializeEvent::ItemConfigured { path } => {
                info!("event=item_configured module=materializer status=ok path={path}");
            }
            MaterializeEvent::WorkflowSkipped {
                path,
                action,
                reason,
            } => {
                warn!(
                    "event=workflow_skipped module=materializer status=recovered path={path} action={action} reason={reason}"
                );
            }
            MaterializeEvent::DefaultPageSet { container, id } => {
                info!("event=default_page_set module=materializer status=ok container={container} id={id}");
            }
        }
    }
}
