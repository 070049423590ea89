//! Entities mirroring the externally owned `sakila` rental schema.
//!
//! This service reads and writes these tables but never creates or
//! migrates them; the schema belongs to the database.

pub mod actor;
pub mod category;
pub mod customer;
pub mod film;
pub mod film_actor;
pub mod film_category;
pub mod inventory;
pub mod rental;
