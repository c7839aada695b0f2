mod find_terms;
