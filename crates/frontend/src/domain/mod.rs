pub mod a001_requisition;
