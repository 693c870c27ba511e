pub mod action;
pub mod card;
pub mod hand;
pub mod rules;
pub mod seat;
pub mod shoe;
