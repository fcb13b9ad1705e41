mod order;

pub use order::{AdminComment, ItemComment, ItemDetail, Order, OrderChangeRequest};
