pub mod sqlite_service;
