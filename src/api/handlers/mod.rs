// HTTP request handlers
// One module per exposed resource

pub mod health;
pub mod metals;
