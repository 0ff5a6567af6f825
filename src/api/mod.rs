pub mod steam;

pub use steam::SteamWebClient;
