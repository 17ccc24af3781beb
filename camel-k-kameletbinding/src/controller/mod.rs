mod completion_handler;

pub use completion_handler::{
    configure_completion_handler, maybe_completion_handler, parse_completion_handler,
    set_completion_handler_configuration,
};
