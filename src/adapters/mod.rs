pub mod blob_storage;
