//! # Handler chain
//!
//! Runs every handler's `before` for each update (any `false` stops the chain), then `handle` in
//! order until one returns Stop or Reply, then every `after` in reverse order with the final
//! response.

use dbot_core::{Handler, HandlerResponse, Result, Update};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers sharing one before → handle → after pass per update.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop/Reply ends the handle phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the chain for one update. Returns the first Stop or Reply, or Continue.
    #[instrument(skip(self, update))]
    pub async fn handle(&self, update: &Update) -> Result<HandlerResponse> {
        let user_id = update.user().id;
        let chat_id = update.chat_id();
        let mut final_response = HandlerResponse::Continue;

        info!(
            user_id,
            chat_id,
            kind = update.kind(),
            "step: handler_chain started"
        );

        for handler in &self.handlers {
            let name = std::any::type_name_of_val(handler.as_ref());
            if !handler.before(update).await? {
                info!(user_id, handler = %name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        for handler in &self.handlers {
            let name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(update).await?;
            debug!(handler = %name, response = ?response, "Handler processed");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(user_id, handler = %name, "step: handler chain stopped by handler");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(update, &final_response).await?;
        }

        info!(
            user_id,
            chat_id,
            response = ?final_response,
            "step: handler_chain finished"
        );

        Ok(final_response)
    }
}
