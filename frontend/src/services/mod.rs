pub mod logging;
pub mod supabase;
pub mod timers;

pub use supabase::SupabaseAuth;
pub use timers::GlooDelay;
