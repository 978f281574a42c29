/*
 * Responsibility
 * - v1 の request/response DTO
 */
pub mod todos;
pub mod users;
