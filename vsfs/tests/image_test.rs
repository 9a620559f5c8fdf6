// SPDX-License-Identifier: MIT

use vsfs::core::utils::{bitmap::BitmapOps, checksum_utils::crc32};
use vsfs::vsfs::*;

const NOW: u64 = 1_700_000_000;

fn format_image(size_kib: u64, inodes: u64) -> (VsfsMeta, Vec<u8>) {
    let meta = VsfsMeta::new(size_kib, inodes).expect("valid layout");
    let mut buf = vec![0u8; meta.image_len() as usize];
    let mut io = MemVsfsIO::new(&mut buf);
    VsfsFormatter::new(&mut io, &meta)
        .with_timestamp(NOW)
        .format(true)
        .expect("format failed");
    (meta, buf)
}

fn insert(buf: &mut [u8], name: &str, content: &[u8]) -> FsInjectorResult<u32> {
    let mut io = MemVsfsIO::new(buf);
    let mut injector = VsfsInjector::open(&mut io)?.with_timestamp(NOW + 60);
    injector.insert_file(name, content)
}

fn check(buf: &mut [u8]) -> FsCheckerResult {
    let mut io = MemVsfsIO::new(buf);
    VsfsChecker::new(&mut io).check_all()
}

fn read_inode(buf: &[u8], meta: &VsfsMeta, inode_no: u32) -> VsfsInode {
    VsfsInode::from_bytes(&buf[meta.inode_offset(inode_no) as usize..]).expect("inode")
}

fn bitmaps(buf: &[u8]) -> (&[u8], &[u8]) {
    (&buf[4096..8192], &buf[8192..12288])
}

#[test]
fn test_layout_tiles_every_valid_geometry() {
    for size_kib in (VSFS_MIN_SIZE_KIB..=VSFS_MAX_SIZE_KIB).step_by(4) {
        for inodes in VSFS_MIN_INODES..=VSFS_MAX_INODES {
            let meta = VsfsMeta::new(size_kib, inodes).unwrap();
            let regions = meta.regions();

            assert_eq!(regions[0].start, 0);
            for pair in regions.windows(2) {
                assert!(pair[0].blocks > 0);
                assert_eq!(pair[0].end(), pair[1].start);
            }
            assert!(regions[4].blocks > 0);
            assert_eq!(regions[4].end(), meta.total_blocks);
            assert_eq!(meta.total_blocks, size_kib / 4);
        }
    }
}

#[test]
fn test_fresh_image_checksums_round_trip() {
    let (meta, mut buf) = format_image(180, 128);

    let sb = VsfsSuperblock::from_bytes(&buf).unwrap();
    let mut block = buf[..4096].to_vec();
    block[112..116].fill(0);
    assert_eq!(sb.checksum.get(), crc32(&block[..4092]));

    let root = read_inode(&buf, &meta, 1);
    let mut raw = root.to_bytes();
    raw[120..].fill(0);
    assert_eq!(root.checksum.get(), crc32(&raw[..120]) as u64);

    let dir = meta.data_block_offset(0) as usize;
    for slot in 0..2 {
        let raw = &buf[dir + slot * 64..dir + slot * 64 + 64];
        let folded = raw[..63].iter().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(raw[63], folded);
    }

    assert_eq!(check(&mut buf), Ok(()));
}

#[test]
fn test_checksum_finalize_is_idempotent() {
    let (meta, buf) = format_image(256, 200);

    let mut sb = VsfsSuperblock::from_bytes(&buf).unwrap();
    let before = sb;
    sb.finalize_checksum();
    sb.finalize_checksum();
    assert_eq!(sb, before);

    let mut root = read_inode(&buf, &meta, 1);
    let before = root;
    root.finalize_checksum();
    assert_eq!(root, before);

    let mut dot = VsfsDirEntry::from_bytes(&buf[meta.data_block_offset(0) as usize..]).unwrap();
    let before = dot;
    dot.finalize_checksum();
    assert_eq!(dot, before);
}

#[test]
fn test_end_to_end_minimum_image() {
    let (meta, mut buf) = format_image(180, 128);
    assert_eq!(meta.total_blocks, 45);
    assert_eq!(meta.inode_table_blocks, 4);
    assert_eq!(meta.data_region_start, 7);
    assert_eq!(meta.data_region_blocks, 38);

    let content = vec![0x42u8; 5000];
    let ino = insert(&mut buf, "/tmp/host/report.txt", &content).unwrap();
    assert_eq!(ino, 2);

    let file = read_inode(&buf, &meta, 2);
    assert_eq!(file.blocks().count(), 2);
    assert_eq!(file.size_bytes.get(), 5000);

    let root = read_inode(&buf, &meta, 1);
    assert_eq!(root.links.get(), 3);
    assert_eq!(root.size_bytes.get(), 192);
    assert!(root.verify_checksum().is_ok());

    let sb = VsfsSuperblock::from_bytes(&buf).unwrap();
    assert_eq!(sb.mtime_epoch.get(), NOW + 60);
    assert!(sb.verify_checksum().is_ok());

    assert_eq!(check(&mut buf), Ok(()));
}

#[test]
fn test_insert_bitmap_deltas_match_inode() {
    let (meta, mut buf) = format_image(512, 128);
    insert(&mut buf, "first", &[1u8; 100]).unwrap();

    for (size, name) in [(0usize, "empty"), (4096, "exact"), (4097, "over"), (40_000, "big")] {
        let (ibm, dbm) = bitmaps(&buf);
        let (ibm_before, dbm_before) = (ibm.to_vec(), dbm.to_vec());

        let ino = insert(&mut buf, name, &vec![9u8; size]).unwrap();
        let (ibm, dbm) = bitmaps(&buf);

        let need = size.div_ceil(4096).max(1);
        assert_eq!(ibm.count_ones(), ibm_before.count_ones() + 1);
        assert_eq!(dbm.count_ones(), dbm_before.count_ones() + need);

        // The new bits are exactly the new inode and its blocks
        let inode = read_inode(&buf, &meta, ino);
        let new_inode_bits: Vec<usize> = (0..4096 * 8)
            .filter(|&i| ibm.get_bit(i) && !ibm_before.get_bit(i))
            .collect();
        assert_eq!(new_inode_bits, vec![ino as usize - 1]);

        let new_data_bits: Vec<u32> = (0..4096 * 8)
            .filter(|&i| dbm.get_bit(i) && !dbm_before.get_bit(i))
            .map(|i| i as u32)
            .collect();
        let mut referenced: Vec<u32> = inode.blocks().collect();
        referenced.sort_unstable();
        assert_eq!(new_data_bits, referenced);
    }

    assert_eq!(check(&mut buf), Ok(()));
}

#[test]
fn test_first_fit_inode_reuse() {
    let (meta, mut buf) = format_image(180, 128);
    assert_eq!(insert(&mut buf, "a", b"a").unwrap(), 2);
    assert_eq!(insert(&mut buf, "b", b"b").unwrap(), 3);

    // A hole at bit 1 is taken before anything higher.
    let (meta2, mut buf2) = format_image(180, 128);
    buf2[4096] |= 0b0000_0100;
    assert_eq!(insert(&mut buf2, "c", b"c").unwrap(), 2);
    assert_eq!(insert(&mut buf2, "d", b"d").unwrap(), 4);

    // Blocks are handed out lowest first, in order.
    assert_eq!(read_inode(&buf, &meta, 2).blocks().collect::<Vec<_>>(), vec![1]);
    assert_eq!(read_inode(&buf, &meta, 3).blocks().collect::<Vec<_>>(), vec![2]);
    assert_eq!(read_inode(&buf2, &meta2, 4).blocks().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_first_fit_with_preset_bits() {
    let (_, mut buf) = format_image(180, 128);
    // Bits {0, 1} set, bit 2 free
    buf[4096] = 0b0000_0011;
    assert_eq!(insert(&mut buf, "third", b"x").unwrap(), 3);
}

#[test]
fn test_full_root_directory_rolls_back_exactly() {
    let (_, mut buf) = format_image(4096, 512);
    for i in 0..62 {
        insert(&mut buf, &format!("file_{i:02}"), &[i as u8; 10]).unwrap();
    }
    assert_eq!(check(&mut buf), Ok(()));

    let before = buf.clone();
    let err = insert(&mut buf, "one_too_many", &[0xEEu8; 9000]).unwrap_err();
    assert_eq!(err, FsInjectorError::DirectoryFull);
    assert_eq!(FsError::Injector(err).kind(), FsErrorKind::Capacity);
    assert!(buf == before, "image changed after failed insert");
}

#[test]
fn test_oversized_file_rejected() {
    let (_, mut buf) = format_image(512, 128);
    let before = buf.clone();
    let content = vec![0u8; 12 * 4096 + 1];

    let err = insert(&mut buf, "huge.bin", &content).unwrap_err();
    assert_eq!(err, FsInjectorError::FileTooLarge(12 * 4096 + 1));
    assert_eq!(FsError::from(err).kind(), FsErrorKind::Capacity);
    assert!(buf == before);
}

#[test]
fn test_out_of_inodes() {
    let (_, mut buf) = format_image(1024, 128);
    // Root holds 64 entries: 62 files after "." and "..", long before inodes run out.
    for i in 0..62 {
        assert_eq!(insert(&mut buf, &format!("f{i}"), &[]), Ok(i + 2));
    }
    assert_eq!(
        insert(&mut buf, "f62", b"x").unwrap_err(),
        FsInjectorError::DirectoryFull
    );

    let (_, mut buf) = format_image(1024, 128);
    buf[4096..4096 + 16].fill(0xFF);
    assert_eq!(
        insert(&mut buf, "x", b"x").unwrap_err(),
        FsInjectorError::Allocator(FsAllocatorError::OutOfInodes)
    );
}

#[test]
fn test_bad_magic_rejected_without_change() {
    let (_, mut buf) = format_image(180, 128);
    buf[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
    let before = buf.clone();

    let err = insert(&mut buf, "a", b"a").unwrap_err();
    assert_eq!(err, FsInjectorError::Parsing(FsParsingError::BadMagic(0xDEAD_BEEF)));
    assert_eq!(FsError::from(err).kind(), FsErrorKind::Format);
    assert!(buf == before);
}

#[test]
fn test_long_name_truncated_to_field() {
    let (meta, mut buf) = format_image(180, 128);
    let name = format!("{}.txt", "n".repeat(70));
    insert(&mut buf, &name, b"data").unwrap();

    let off = meta.data_block_offset(0) as usize + 2 * 64;
    let entry = VsfsDirEntry::from_bytes(&buf[off..]).unwrap();
    assert_eq!(entry.name_lossy(), "n".repeat(58));
    assert!(entry.verify_checksum().is_ok());
}

#[test]
fn test_file_backed_image() {
    let meta = VsfsMeta::new(256, 128).unwrap();
    let mut file = tempfile::tempfile().expect("tempfile failed");
    file.set_len(meta.image_len()).expect("set_len failed");

    let mut io = StdVsfsIO::new(&mut file);
    VsfsFormatter::new(&mut io, &meta).format(false).unwrap();
    let ino = VsfsInjector::open(&mut io)
        .unwrap()
        .insert_file("disk.bin", &[5u8; 6000])
        .unwrap();
    assert_eq!(ino, 2);
    assert_eq!(VsfsChecker::new(&mut io).check_all(), Ok(()));
}
