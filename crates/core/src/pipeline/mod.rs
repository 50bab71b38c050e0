pub mod duke_image_use_case;
