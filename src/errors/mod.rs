mod import_export;

pub use import_export::ImportExportError;

pub type Result<T> = std::result::Result<T, ImportExportError>;
