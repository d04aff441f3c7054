pub mod bill_request;
