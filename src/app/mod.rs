pub mod controller;
pub mod lab_app;
pub mod views;

pub use controller::LabController;
pub use lab_app::AfmLabApp;
pub use views::View;
