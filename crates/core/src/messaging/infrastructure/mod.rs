pub mod listener_pool;
