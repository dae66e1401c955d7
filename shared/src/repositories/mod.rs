pub mod price_repository;
pub mod quality_repository;
pub mod watermark_repository;
