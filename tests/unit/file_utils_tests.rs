/*!
 * Tests for file utility functions
 */

use std::fs;

use anyhow::Result;
use subscout::file_utils::FileManager;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists distinguishes directories from files
#[test]
fn test_dir_exists_shouldDistinguishDirectoriesFromFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "plain.txt", "x")?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));

    Ok(())
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("test_subdir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.exists());
    assert!(test_subdir.is_dir());

    Ok(())
}

/// Test that read_to_string returns file content correctly
#[test]
fn test_read_to_string_withValidFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "Hello, World!";
    let test_file = common::create_test_file(temp_dir.path(), "test_read_file.tmp", content)?;

    let read_content = FileManager::read_to_string(&test_file)?;
    assert_eq!(read_content, content);

    Ok(())
}

/// Test that read_prefix honors the byte limit
#[test]
fn test_read_prefix_withLimit_shouldTruncate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "prefix.txt", "0123456789")?;

    assert_eq!(FileManager::read_prefix(&test_file, Some(4))?, b"0123");
    assert_eq!(FileManager::read_prefix(&test_file, None)?, b"0123456789");
    // A limit past the end reads the whole file
    assert_eq!(FileManager::read_prefix(&test_file, Some(100))?, b"0123456789");

    Ok(())
}

/// Test that write_to_file creates parent directories and content
#[test]
fn test_write_to_file_withNestedPath_shouldCreateFileWithContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("nested").join("test_write_file.tmp");
    let content = "Test write content";

    FileManager::write_to_file(&test_file, content)?;

    assert!(test_file.exists());
    let read_content = fs::read_to_string(&test_file)?;
    assert_eq!(read_content, content);

    Ok(())
}
