//! `initialize(x)`: slack set to 1.0, every BMP share variable to a
//! uniform random draw in `[0,1]`.

use rand::Rng;

use crate::layout::EncodingLayout;

pub fn initialize(layout: &EncodingLayout, x: &mut [f64], rng: &mut impl Rng) {
    assert_eq!(x.len(), layout.nvars, "x must match the layout's nvars");
    for slot in &layout.efficiency {
        init_group(x, slot.offset, slot.bmps.len(), rng);
    }
    for slot in &layout.land_conversion {
        init_group(x, slot.offset, slot.destinations.len(), rng);
    }
    for slot in &layout.animal {
        init_group(x, slot.offset, slot.bmps.len(), rng);
    }
    for slot in &layout.manure {
        init_group(x, slot.offset, slot.destinations.len(), rng);
    }
}

fn init_group(x: &mut [f64], offset: usize, k: usize, rng: &mut impl Rng) {
    x[offset] = 1.0;
    for i in 0..k {
        x[offset + 1 + i] = rng.gen_range(0.0..1.0);
    }
}
