pub use super::deletion_preferences::Entity as DeletionPreferences;
