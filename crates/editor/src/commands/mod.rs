//! Subcommands of the `dex` binary.
mod check;
mod moves;
mod pokemon;
mod refs;

pub use check::Check;
pub use moves::MovesCommand;
pub use pokemon::PokemonCommand;
pub use refs::Refs;
