pub mod afirma;
