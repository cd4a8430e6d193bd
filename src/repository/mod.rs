pub mod orders;

pub use orders::{OrderPage, OrderRepository};
