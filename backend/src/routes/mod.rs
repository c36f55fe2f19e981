pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod news;
pub(crate) mod prices;
pub(crate) mod watchlist;
