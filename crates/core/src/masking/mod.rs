pub mod duke_mask;
