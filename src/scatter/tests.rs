use super::*;
use crate::error::*;

use std::io::Cursor;

use test_log::test;

const SECTORS: usize = 8;

/// Three 512-byte sections: "AAAA..." at 0, "BBBB..." at 512 and "CCCC..." at 1024
fn program() -> Vec<u8> {
    [b"AAAA", b"BBBB", b"CCCC"]
        .iter()
        .flat_map(|pattern| pattern.repeat(128))
        .collect()
}

fn blank_image() -> Vec<u8> {
    vec![0_u8; SECTORS * SECTOR_SIZE as usize]
}

fn sector(image: &[u8], n: usize) -> &[u8] {
    let size = SECTOR_SIZE as usize;
    &image[n * size..(n + 1) * size]
}

fn floppy_map() -> SectorMap {
    [
        SectorMapEntry::new(2, "section1", 0),
        SectorMapEntry::new(3, "section2", 512),
        SectorMapEntry::new(4, "section3", 1024),
    ]
    .into_iter()
    .collect()
}

/// Scatter `map` from `source` onto `dest`, returning the result and the final destination
fn run(
    source: Vec<u8>,
    dest: Vec<u8>,
    map: &SectorMap,
    options: ScatterOptions,
) -> (ScatterResult<Vec<Placement>, std::io::Error>, Vec<u8>) {
    let mut scatterer =
        SectorScatterer::new(Cursor::new(source), Cursor::new(dest), options).unwrap();
    let result = scatterer.scatter(map);
    let (_, dest) = scatterer.into_parts();

    (result, dest.into_inner())
}

#[test]
fn scatter_three_sections_onto_floppy() {
    let program = program();
    let (result, image) = run(
        program.clone(),
        blank_image(),
        &floppy_map(),
        ScatterOptions::default(),
    );

    let placements = result.unwrap();
    assert_eq!(placements.len(), 3);
    assert_eq!(
        placements[0].to_string(),
        "Section 'section1' written to sector 2"
    );
    assert_eq!(placements[2].dest_offset, 4 * 512);

    assert_eq!(sector(&image, 2), &program[..512]);
    assert_eq!(sector(&image, 3), &program[512..1024]);
    assert_eq!(sector(&image, 4), &program[1024..]);

    for n in [0, 1, 5, 6, 7] {
        assert!(
            sector(&image, n).iter().all(|b| *b == 0),
            "sector {n} was modified"
        );
    }
}

#[test]
fn scatter_is_idempotent() {
    let (first, once) = run(
        program(),
        blank_image(),
        &floppy_map(),
        ScatterOptions::default(),
    );
    first.unwrap();

    let (second, twice) = run(program(), once.clone(), &floppy_map(), ScatterOptions::default());
    second.unwrap();

    assert_eq!(once, twice);
}

#[test]
fn short_section_leaves_rest_of_sector_untouched() {
    // the last section is only 100 bytes long, since the source ends there
    let source = vec![0xAB_u8; 612];
    let dest = vec![0xFF_u8; SECTORS * SECTOR_SIZE as usize];

    let map: SectorMap = [SectorMapEntry::new(5, "tail", 512)].into_iter().collect();
    let (result, image) = run(source, dest, &map, ScatterOptions::default());

    assert_eq!(result.unwrap()[0].len, 100);
    assert!(sector(&image, 5)[..100].iter().all(|b| *b == 0xAB));
    assert!(sector(&image, 5)[100..].iter().all(|b| *b == 0xFF));
    assert!(sector(&image, 4).iter().all(|b| *b == 0xFF));
}

#[test]
fn section_of_exactly_one_sector_is_accepted() {
    let map: SectorMap = [SectorMapEntry::new(1, "exact", 0).with_length(512)]
        .into_iter()
        .collect();
    let (result, image) = run(program(), blank_image(), &map, ScatterOptions::default());

    assert_eq!(result.unwrap()[0].len, 512);
    assert_eq!(sector(&image, 1), &program()[..512]);
}

#[test]
fn oversized_section_aborts_after_prior_writes() {
    let map: SectorMap = [
        SectorMapEntry::new(1, "fits", 0),
        SectorMapEntry::new(2, "too_big", 512).with_length(513),
        SectorMapEntry::new(3, "never_written", 1024),
    ]
    .into_iter()
    .collect();
    let (result, image) = run(program(), blank_image(), &map, ScatterOptions::default());

    match result {
        Err(ScatterError::OversizedSection {
            name,
            length,
            sector_size,
        }) => {
            assert_eq!(name, "too_big");
            assert_eq!(length, 513);
            assert_eq!(sector_size, 512);
        }
        other => panic!("expected an oversized section, got {:?}", other),
    }

    // the first section made it to the disk, nothing after it did
    assert_eq!(sector(&image, 1), &program()[..512]);
    assert!(sector(&image, 2).iter().all(|b| *b == 0));
    assert!(sector(&image, 3).iter().all(|b| *b == 0));
}

#[test]
fn declared_length_cut_short_by_eof_is_accepted() {
    // 1024 bytes are declared, but only 36 remain in the source
    let map: SectorMap = [SectorMapEntry::new(6, "truncated", 1500).with_length(1024)]
        .into_iter()
        .collect();
    let (result, image) = run(program(), blank_image(), &map, ScatterOptions::default());

    assert_eq!(result.unwrap()[0].len, 36);
    assert_eq!(&sector(&image, 6)[..36], &program()[1500..]);
}

#[test]
fn custom_sector_size() {
    let options = ScatterOptions::default().sector_size(256);
    let map: SectorMap = [SectorMapEntry::new(3, "quarter", 512)].into_iter().collect();
    let (result, image) = run(program(), blank_image(), &map, options);

    let placement = result.unwrap().remove(0);
    assert_eq!(placement.dest_offset, 768);
    assert_eq!(placement.len, 256);
    assert_eq!(&image[768..1024], &program()[512..768]);
    assert!(image[1024..].iter().all(|b| *b == 0));
}

#[test]
fn zero_sector_size_is_rejected() {
    let result = SectorScatterer::new(
        Cursor::new(program()),
        Cursor::new(blank_image()),
        ScatterOptions::default().sector_size(0),
    );

    assert!(matches!(result, Err(ScatterError::InvalidSectorSize)));
}

#[test]
fn short_destination_is_not_extended_by_default() {
    let dest = vec![0_u8; 3 * SECTOR_SIZE as usize];
    let (result, image) = run(program(), dest, &floppy_map(), ScatterOptions::default());

    match result {
        Err(ScatterError::DestinationTooSmall {
            sector,
            required,
            available,
        }) => {
            assert_eq!(sector, 3);
            assert_eq!(required, 4 * 512);
            assert_eq!(available, 3 * 512);
        }
        other => panic!("expected a too small destination, got {:?}", other),
    }

    // sector 2 fit, so it was written before the failure
    assert_eq!(image.len(), 3 * 512);
    assert_eq!(sector(&image, 2), &program()[..512]);
}

#[test]
fn short_destination_grows_when_allowed() {
    let dest = vec![0_u8; 2 * SECTOR_SIZE as usize];
    let (result, image) = run(
        program(),
        dest,
        &floppy_map(),
        ScatterOptions::default().grow(true),
    );

    result.unwrap();
    assert_eq!(image.len(), 5 * 512);
    assert_eq!(&image[1024..], &program()[..]);
}

#[test]
fn sector_beyond_addressable_range() {
    let map: SectorMap = [SectorMapEntry::new(u64::MAX, "far_away", 0)]
        .into_iter()
        .collect();
    let (result, _) = run(
        program(),
        blank_image(),
        &map,
        ScatterOptions::default().grow(true),
    );

    assert!(matches!(
        result,
        Err(ScatterError::SectorOutOfRange { sector: u64::MAX })
    ));
}

#[test]
fn empty_map_writes_nothing() {
    let (result, image) = run(
        program(),
        blank_image(),
        &SectorMap::new(),
        ScatterOptions::default(),
    );

    assert!(result.unwrap().is_empty());
    assert_eq!(image, blank_image());
}

#[test]
fn scatter_shorthand_borrows_streams() {
    let mut source = Cursor::new(program());
    let mut dest = Cursor::new(blank_image());

    scatter(&mut source, &mut dest, &floppy_map(), ScatterOptions::default()).unwrap();

    assert_eq!(sector(dest.get_ref(), 3), &program()[512..1024]);
}

#[test]
fn sections_are_reported_as_they_are_written() {
    let map: SectorMap = [
        SectorMapEntry::new(1, "boot", 0),
        SectorMapEntry::new(2, "kernel", 0).with_length(1536),
        SectorMapEntry::new(3, "never_written", 1024),
    ]
    .into_iter()
    .collect();
    let mut scatterer = SectorScatterer::new(
        Cursor::new(program()),
        Cursor::new(blank_image()),
        ScatterOptions::default(),
    )
    .unwrap();

    let mut reported = Vec::new();
    let result = scatterer.scatter_with(&map, |placement| reported.push(placement.sector));

    assert!(matches!(
        result,
        Err(ScatterError::OversizedSection { .. })
    ));
    // the sector written before the failure was still reported
    assert_eq!(reported, [1]);
}

#[test]
fn huge_declared_length_is_read_as_one_sector_and_a_byte() {
    let map: SectorMap = [SectorMapEntry::new(1, "huge", 0).with_length(u64::MAX)]
        .into_iter()
        .collect();
    let (result, image) = run(program(), blank_image(), &map, ScatterOptions::default());

    match result {
        Err(ScatterError::OversizedSection { length, .. }) => assert_eq!(length, u64::MAX),
        other => panic!("expected an oversized section, got {:?}", other),
    }
    assert_eq!(image, blank_image());
}

#[test]
fn largest_sector_size_is_refused_without_room_for_the_extra_byte() {
    // on targets where `usize` is as wide as `u32`, that extra byte can't be addressed
    if usize::BITS > u32::BITS {
        return;
    }

    let result = SectorScatterer::new(
        Cursor::new(program()),
        Cursor::new(blank_image()),
        ScatterOptions::default().sector_size(u32::MAX),
    );

    assert!(matches!(result, Err(ScatterError::InvalidSectorSize)));
}
