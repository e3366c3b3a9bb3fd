// Modular tools
pub mod dni;
pub mod health;
pub mod pages;
pub mod refresh;
pub mod schema;
pub mod seo_links;
pub mod sitemap;
pub mod urls;
