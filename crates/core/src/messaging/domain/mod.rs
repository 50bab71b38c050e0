pub mod queue_message;
