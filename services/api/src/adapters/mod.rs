pub mod db;
pub mod mymemory;
pub mod openai_translate;

pub use db::DbAdapter;
pub use mymemory::MyMemoryAdapter;
pub use openai_translate::OpenAiTranslationAdapter;
