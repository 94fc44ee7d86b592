use proptest::prelude::*;
use strata_blocks::{Block, BlockKind, DripstoneThickness, MAX_PLANT_AGE};
use strata_geom::Direction;

fn thickness() -> impl Strategy<Value = DripstoneThickness> {
    prop::sample::select(DripstoneThickness::ALL.to_vec())
}

fn vertical() -> impl Strategy<Value = Direction> {
    prop::sample::select(vec![Direction::Up, Direction::Down])
}

proptest! {
    // Dripstone properties survive packing and waterlogging independently
    #[test]
    fn dripstone_properties_are_independent(t in thickness(), d in vertical(), wet in any::<bool>()) {
        let b = Block::pointed_dripstone(d, t).with_waterlogged(wet);
        prop_assert_eq!(b.dripstone_thickness(), Some(t));
        prop_assert_eq!(b.vertical_direction(), Some(d));
        prop_assert_eq!(b.is_waterlogged(), wet);
        prop_assert_eq!(b.fluid_state().is_water(), wet);
    }

    // Age is clamped to the plant maximum and only applies to vine heads
    #[test]
    fn age_is_clamped(age in any::<u8>()) {
        let head = Block::new(BlockKind::TwistingVines).with_age(age);
        prop_assert_eq!(head.age(), Some(age.min(MAX_PLANT_AGE)));
        let plant = Block::new(BlockKind::TwistingVinesPlant).with_age(age);
        prop_assert_eq!(plant.age(), None);
        prop_assert_eq!(plant.state, 0);
    }

    // Vine faces are toggled one bit at a time; the floor face never sticks
    #[test]
    fn vine_faces_toggle(i in 0i32..6, attached in any::<bool>()) {
        let face = Direction::from_index(i);
        let v = Block::new(BlockKind::Vine).with_vine_face(face, attached);
        let expected = attached && face != Direction::Down;
        prop_assert_eq!(v.has_vine_face(face), expected);
        for other in Direction::ALL {
            if other != face {
                prop_assert!(!v.has_vine_face(other));
            }
        }
    }

    // Stateless kinds serialize by name and read back as their default state
    #[test]
    fn block_names_read_back(idx in 0usize..BlockKind::ALL.len()) {
        let kind = BlockKind::ALL[idx];
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrap { block: Block }
        let text = toml::to_string(&Wrap { block: Block::new(kind) }).unwrap();
        let back: Wrap = toml::from_str(&text).unwrap();
        prop_assert_eq!(back.block, Block::new(kind));
    }
}
