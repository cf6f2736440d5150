pub mod expression_service;
