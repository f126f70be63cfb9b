pub mod rank_badge;
